/// Top band size for the J1 rule (first, second, third place)
pub const J1_TOP_BAND: u32 = 3;

/// Top band size for the J2/J3 rule (promotion and playoff places)
pub const LOWER_TIER_TOP_BAND: u32 = 6;

/// Bottom band size shared by every league (last three places)
pub const BOTTOM_BAND: u32 = 3;

/// Score for a team in the right band but the wrong slot
pub const BAND_SCORE: u8 = 1;

/// Score for an exact slot match
pub const EXACT_SCORE: u8 = 2;

/// Ordinal labels for top slots, indexed from zero
pub const TOP_SLOT_LABELS: [&str; 6] = [
    "First Place",
    "Second Place",
    "Third Place",
    "Fourth Place",
    "Fifth Place",
    "Sixth Place",
];

/// Column header suffixes for top slots, as spelled on the entry form
/// (fourth place has always been headed "FORTH")
pub const TOP_SLOT_COLUMNS: [&str; 6] = [
    "First Place",
    "Second Place",
    "Third Place",
    "FORTH Place",
    "Fifth Place",
    "Sixth Place",
];

/// Labels for the bottom slots, in slot order
pub const BOTTOM_SLOT_LABELS: [&str; 3] = [
    "Third from Last Place",
    "Second from Last Place",
    "Last Place",
];
