//! Fixed byte offsets of the controller memory image
//!
//! Standard images are 0x39C0 (14,784) bytes. All multi-byte timing fields are
//! single bytes; the flash hours are little-endian u16 slots and the
//! manufacturer year is big-endian.

/// Expected size of a standard image
pub const FILE_SIZE: usize = 0x39C0;
/// Size of the extended SUHDOL image (signature block shifted by 0x38)
pub const EXTENDED_FILE_SIZE: usize = 0x39FE;
/// Size of an LCsim simulator image
pub const LCSIM_FILE_SIZE: usize = 61_472;

// Timing plans: 10 day-plans x 8 entries x 20 bytes
pub const TIMEPLAN_BASE: usize = 0x0000;
pub const ENTRY_SIZE: usize = 20;
pub const ENTRIES_PER_PLAN: usize = 8;
pub const PLAN_COUNT: usize = 10;
pub const PLAN_SIZE: usize = ENTRY_SIZE * ENTRIES_PER_PLAN;
/// Split pairs per entry, starting at byte 4
pub const SPLIT_PAIRS: usize = 8;
pub const ENTRY_HOUR: usize = 0;
pub const ENTRY_MINUTE: usize = 1;
pub const ENTRY_CYCLE: usize = 2;
pub const ENTRY_OFFSET: usize = 3;
pub const ENTRY_SPLITS: usize = 4;

// Signal heads
pub const LSU_COUNT: usize = 8;
pub const LSU_ACTIVE_FLAGS: usize = 0x0CDA;
/// 8 records of (t1, t2)
pub const LSU_TYPES: usize = 0x2F6A;
pub const LSU_TYPE_RECORD_SIZE: usize = 2;

// Flash schedule
pub const FLASH_START: usize = 0x0CE4;
pub const FLASH_END: usize = 0x0CE6;

// Rings: 32 steps x (16 head codes + min + max + eop)
pub const RING_A: usize = 0x0E2A;
pub const RING_B: usize = 0x108A;
pub const STEP_SIZE: usize = 19;
pub const MAX_STEPS: usize = 32;
pub const STEP_HEADS: usize = 16;
pub const STEP_MIN: usize = 16;
pub const STEP_MAX: usize = 17;
pub const STEP_EOP: usize = 18;

// Manufacturer block
pub const MFR_NAME: usize = 0x395A;
pub const MFR_NAME_LEN: usize = 20;
pub const MFR_YEAR: usize = 0x3974;

/// SUHDOL vendor signature
pub const SUHDOL_SIGNATURE: &[u8] = b"SUHDOL";
/// Header of 한진이엔씨 remote-data exports
pub const REMOTE_DATA_HEADER: &[u8] = b"Remote Data";

/// Location of the SUHDOL signature, modification date and service phone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureBlock {
    pub signature: usize,
    pub date: usize,
    pub phone: usize,
}

pub const STANDARD_SIGNATURE_BLOCK: SignatureBlock = SignatureBlock {
    signature: 0x391D,
    date: 0x3936,
    phone: 0x393B,
};

pub const EXTENDED_SIGNATURE_BLOCK: SignatureBlock = SignatureBlock {
    signature: 0x3955,
    date: 0x396E,
    phone: 0x3973,
};

/// Offset of a timing-plan entry
pub const fn entry_offset(plan: usize, entry: usize) -> usize {
    TIMEPLAN_BASE + plan * PLAN_SIZE + entry * ENTRY_SIZE
}

/// Offset of a ring step
pub const fn step_offset(ring_base: usize, step: usize) -> usize {
    ring_base + step * STEP_SIZE
}
