//! DAT image reader
//!
//! Decodes a raw controller memory image into a [`DatImage`]. Every field is
//! read from its fixed offset as a pure function of the buffer; there is no
//! cursor and no failure mode. Bytes past the end of a short buffer read as 0.

use super::image::{
    DatImage, FlashSchedule, LsuTypeRecord, ManufacturerInfo, Ring, RingStep, TimingPlanEntry,
};
use super::{byte_at, bytes_at, layout, nul_terminated};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// DAT image reader
pub struct DatReader;

impl DatReader {
    /// Decode a controller image
    ///
    /// # Arguments
    /// * `buf` - Raw image bytes (normally 0x39C0 bytes)
    ///
    /// # Returns
    /// * `DatImage` - Best-effort structure; truncated input yields zero fields
    pub fn parse(buf: &[u8]) -> DatImage {
        if buf.len() < layout::FILE_SIZE {
            log::warn!(
                "DAT image is {} bytes, expected {}; missing bytes read as 0",
                buf.len(),
                layout::FILE_SIZE
            );
        }

        let image = DatImage {
            size: buf.len(),
            day_plans: Self::read_day_plans(buf),
            ring_a: Self::read_ring(buf, layout::RING_A),
            ring_b: Self::read_ring(buf, layout::RING_B),
            lsu_active: Self::read_lsu_active(buf),
            lsu_types: Self::read_lsu_types(buf),
            flash: Self::read_flash(buf),
            manufacturer: Self::read_manufacturer(buf),
        };

        log::debug!(
            "Decoded DAT image: {} used plan entries, {} ring A steps with EOP",
            image.used_entries().count(),
            image.ring_a.end_of_phase_count()
        );
        image
    }

    /// Decode all 10 day-plans
    pub fn read_day_plans(buf: &[u8]) -> Vec<Vec<TimingPlanEntry>> {
        (0..layout::PLAN_COUNT)
            .map(|plan| {
                (0..layout::ENTRIES_PER_PLAN)
                    .map(|entry| Self::read_entry(buf, layout::entry_offset(plan, entry)))
                    .collect()
            })
            .collect()
    }

    /// Decode one 20-byte timing-plan entry at `offset`
    pub fn read_entry(buf: &[u8], offset: usize) -> TimingPlanEntry {
        let raw: [u8; layout::ENTRY_SIZE] = bytes_at(buf, offset);

        let mut splits = [(0u8, 0u8); layout::SPLIT_PAIRS];
        for (slot, pair) in splits.iter_mut().enumerate() {
            let at = layout::ENTRY_SPLITS + slot * 2;
            *pair = (raw[at], raw[at + 1]);
        }

        TimingPlanEntry {
            hour: raw[layout::ENTRY_HOUR],
            minute: raw[layout::ENTRY_MINUTE],
            cycle: raw[layout::ENTRY_CYCLE],
            offset: raw[layout::ENTRY_OFFSET],
            splits,
        }
    }

    /// Decode a 32-step ring starting at `base`
    pub fn read_ring(buf: &[u8], base: usize) -> Ring {
        let steps = (0..layout::MAX_STEPS)
            .map(|step| Self::read_step(buf, layout::step_offset(base, step)))
            .collect();
        Ring { steps }
    }

    /// Decode one 19-byte ring step at `offset`
    pub fn read_step(buf: &[u8], offset: usize) -> RingStep {
        let raw: [u8; layout::STEP_SIZE] = bytes_at(buf, offset);

        let mut lsu = [0u8; layout::STEP_HEADS];
        lsu.copy_from_slice(&raw[..layout::STEP_HEADS]);

        RingStep {
            lsu,
            min: raw[layout::STEP_MIN],
            max: raw[layout::STEP_MAX],
            eop: raw[layout::STEP_EOP],
        }
    }

    /// Active flag per head (byte value 1 = active)
    pub fn read_lsu_active(buf: &[u8]) -> Vec<bool> {
        (0..layout::LSU_COUNT)
            .map(|head| byte_at(buf, layout::LSU_ACTIVE_FLAGS + head) == 1)
            .collect()
    }

    /// Declared type record per head
    pub fn read_lsu_types(buf: &[u8]) -> Vec<LsuTypeRecord> {
        (0..layout::LSU_COUNT)
            .map(|head| {
                let [t1, t2]: [u8; 2] =
                    bytes_at(buf, layout::LSU_TYPES + head * layout::LSU_TYPE_RECORD_SIZE);
                LsuTypeRecord { t1, t2 }
            })
            .collect()
    }

    pub fn read_flash(buf: &[u8]) -> FlashSchedule {
        FlashSchedule {
            start: LittleEndian::read_u16(&bytes_at::<2>(buf, layout::FLASH_START)),
            end: LittleEndian::read_u16(&bytes_at::<2>(buf, layout::FLASH_END)),
        }
    }

    /// Manufacturer name (NUL-terminated, at most 20 bytes) and big-endian year
    pub fn read_manufacturer(buf: &[u8]) -> ManufacturerInfo {
        ManufacturerInfo {
            name: Self::read_manufacturer_name(buf),
            year: BigEndian::read_u16(&bytes_at::<2>(buf, layout::MFR_YEAR)),
        }
    }

    pub fn read_manufacturer_name(buf: &[u8]) -> String {
        nul_terminated(buf, layout::MFR_NAME, layout::MFR_NAME_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image() -> Vec<u8> {
        vec![0u8; layout::FILE_SIZE]
    }

    #[test]
    fn test_entry_fields_at_offsets() {
        let mut buf = blank_image();
        let off = layout::entry_offset(3, 5);
        buf[off..off + 6].copy_from_slice(&[7, 30, 140, 12, 50, 51]);
        buf[off + 19] = 9;

        let image = DatReader::parse(&buf);
        let entry = &image.day_plans[3][5];
        assert_eq!(entry.hour, 7);
        assert_eq!(entry.minute, 30);
        assert_eq!(entry.cycle, 140);
        assert_eq!(entry.offset, 12);
        assert_eq!(entry.splits[0], (50, 51));
        assert_eq!(entry.splits[7], (0, 9));
    }

    #[test]
    fn test_ring_step_fields() {
        let mut buf = blank_image();
        let off = layout::step_offset(layout::RING_B, 31);
        buf[off] = 0x10;
        buf[off + 15] = 0x80;
        buf[off + 16] = 4;
        buf[off + 17] = 60;
        buf[off + 18] = 1;

        let image = DatReader::parse(&buf);
        let step = &image.ring_b.steps[31];
        assert_eq!(step.code(0), 0x10);
        assert_eq!(step.code(15), 0x80);
        assert_eq!((step.min, step.max, step.eop), (4, 60, 1));
        assert_eq!(image.ring_a.steps.len(), layout::MAX_STEPS);
        assert!(image.ring_a.steps.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_lsu_tables_and_flash() {
        let mut buf = blank_image();
        buf[layout::LSU_ACTIVE_FLAGS] = 1;
        buf[layout::LSU_ACTIVE_FLAGS + 1] = 2;
        buf[layout::LSU_TYPES + 2] = 0x88;
        buf[layout::LSU_TYPES + 3] = 0x01;
        buf[layout::FLASH_START] = 23;
        buf[layout::FLASH_END] = 5;

        let image = DatReader::parse(&buf);
        assert!(image.lsu_active[0]);
        assert!(!image.lsu_active[1]);
        assert_eq!(image.lsu_types[1], LsuTypeRecord { t1: 0x88, t2: 0x01 });
        assert_eq!(image.flash, FlashSchedule { start: 23, end: 5 });
    }

    #[test]
    fn test_manufacturer_name_and_year() {
        let mut buf = blank_image();
        buf[layout::MFR_NAME..layout::MFR_NAME + 6].copy_from_slice(b"SUHDOL");
        buf[layout::MFR_YEAR] = 0x07;
        buf[layout::MFR_YEAR + 1] = 0xE8;

        let info = DatReader::read_manufacturer(&buf);
        assert_eq!(info.name, "SUHDOL");
        assert_eq!(info.year, 2024);
    }

    #[test]
    fn test_name_bounded_to_twenty_bytes() {
        let mut buf = blank_image();
        for b in &mut buf[layout::MFR_NAME..layout::MFR_NAME + 30] {
            *b = b'X';
        }
        assert_eq!(DatReader::read_manufacturer_name(&buf).len(), layout::MFR_NAME_LEN);
    }

    #[test]
    fn test_truncated_buffer_reads_zero() {
        let mut buf = vec![0u8; layout::RING_A + 5];
        buf[layout::RING_A] = 0x10;

        let image = DatReader::parse(&buf);
        assert_eq!(image.size, layout::RING_A + 5);
        assert!(!image.has_expected_size());
        assert_eq!(image.ring_a.steps[0].code(0), 0x10);
        assert_eq!(image.ring_a.steps[0].min, 0);
        assert!(image.ring_b.steps.iter().all(|s| s.is_empty()));
        assert_eq!(image.manufacturer, ManufacturerInfo::default());
        assert_eq!(image.day_plans.len(), layout::PLAN_COUNT);
    }
}
