//! Main decoder API
//!
//! [`DatDecoder`] is the entry point for turning a controller image into a
//! report-ready [`DatSummary`]. It runs every stage of the DAT pipeline:
//! format detection, layout decoding, vendor classification, phase
//! reconstruction, period extraction and the plan/cycle tables.

use crate::analysis::{CycleTable, Period, PeriodExtractor, Phase, PhaseAnalyzer, PlanLevel};
use crate::dat::{
    DatImage, DatReader, FlashSchedule, FormatDetector, FormatInfo, IntersectionLabel, Manufacturer, ManufacturerDetector,
};
use crate::types::Result;
use serde::Serialize;
use std::path::Path;

/// Everything known about one controller image
#[derive(Debug, Clone, Serialize)]
pub struct DatSummary {
    pub filename: String,
    /// Leading `NN_` number of the filename
    pub intersection_number: Option<u32>,
    /// Intersection name cleaned from the filename
    pub intersection_name: Option<String>,
    /// Buffer size in bytes
    pub size: usize,
    /// True if the buffer had the standard 14,784-byte size
    pub expected_size: bool,
    pub format: FormatInfo,
    pub manufacturer: Manufacturer,
    /// Raw name region contents
    pub manufacturer_name: String,
    pub year: u16,
    pub flash: FlashSchedule,
    /// Type label per head (차량4색, 차량3색, 보행2색 or hex)
    pub lsu_types: Vec<String>,
    pub lsu_active: Vec<bool>,
    pub phase_count: usize,
    pub phases: Vec<Phase>,
    pub periods: Vec<Period>,
    pub plan_levels: Vec<PlanLevel>,
    pub cycle_table: CycleTable,
    /// Indices into `periods` whose split encodings disagree
    pub review: Vec<usize>,
    /// Decoded image, kept for ring-table rendering
    #[serde(skip)]
    pub image: DatImage,
}

impl DatSummary {
    /// Distinct day-plans that carry at least one period
    pub fn plan_count(&self) -> usize {
        let mut plans: Vec<usize> = self.periods.iter().map(|p| p.plan).collect();
        plans.dedup();
        plans.len()
    }

    pub fn invalid_periods(&self) -> impl Iterator<Item = &Period> + '_ {
        self.periods.iter().filter(|p| !p.valid())
    }
}

/// The DAT decoder - entry point for all image decoding
pub struct DatDecoder;

impl DatDecoder {
    /// Decode an in-memory image
    ///
    /// Never fails: a truncated or empty buffer yields zero-valued fields,
    /// no phases and no periods.
    ///
    /// # Example
    /// ```
    /// use signal_timing::DatDecoder;
    ///
    /// let summary = DatDecoder::decode_bytes(&[0u8; 64], "short.dat");
    /// assert!(!summary.expected_size);
    /// assert_eq!(summary.manufacturer.label(), "한진이엔씨");
    /// ```
    pub fn decode_bytes(buf: &[u8], filename: &str) -> DatSummary {
        log::debug!("Decoding {} ({} bytes)", filename, buf.len());

        let label = IntersectionLabel::from_filename(filename);
        let format = FormatDetector::detect(buf);
        let image = DatReader::parse(buf);
        let manufacturer = ManufacturerDetector::classify_name(&image.manufacturer.name);
        let phases = PhaseAnalyzer::analyze(&image);
        let periods = PeriodExtractor::extract(&image);
        let cycle_table = CycleTable::build(&phases, &periods);
        let review = periods
            .iter()
            .enumerate()
            .filter(|(_, p)| p.needs_review())
            .map(|(i, _)| i)
            .collect();

        DatSummary {
            filename: filename.to_string(),
            intersection_number: label.number,
            intersection_name: label.name,
            size: buf.len(),
            expected_size: image.has_expected_size(),
            format,
            manufacturer,
            manufacturer_name: image.manufacturer.name.clone(),
            year: image.manufacturer.year,
            flash: image.flash,
            lsu_types: image.lsu_types.iter().map(|t| t.kind().label()).collect(),
            lsu_active: image.lsu_active.clone(),
            phase_count: phases.len(),
            phases,
            periods,
            plan_levels: cycle_table.plans.levels.clone(),
            cycle_table,
            review,
            image,
        }
    }

    /// Read and decode an image from disk
    ///
    /// # Example
    /// ```no_run
    /// use signal_timing::DatDecoder;
    /// use std::path::Path;
    ///
    /// let summary = DatDecoder::decode_file(Path::new("intersection.dat")).unwrap();
    /// println!("{} phases, {} periods", summary.phase_count, summary.periods.len());
    /// ```
    pub fn decode_file(path: &Path) -> Result<DatSummary> {
        log::info!("Decoding DAT file: {:?}", path);

        let buf = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let summary = Self::decode_bytes(&buf, &filename);
        log::info!(
            "Decoded {:?}: {} ({}), {} phases, {} periods",
            path,
            summary.manufacturer,
            summary.format.format,
            summary.phase_count,
            summary.periods.len()
        );
        Ok(summary)
    }
}
