//! Built-in entries, rendered when no entry file is given.

use crate::entry::{Entry, Rgb};
use chrono::{DateTime, Duration, FixedOffset};

const GREEN: Rgb = Rgb(0, 128, 0);
const RED: Rgb = Rgb(255, 0, 0);
const BLUE: Rgb = Rgb(0, 0, 255);

/// Sample entries timestamped relative to `now`
pub fn sample_entries(now: DateTime<FixedOffset>) -> Vec<Entry> {
    let ago = |minutes: i64| now - Duration::minutes(minutes);
    vec![
        Entry::new(
            ago(120),
            "System",
            "Criteria Pass: ✅ Material: Both the reference and candidate components use the same \
             materials for the connector: PBT for the housing and Copper Alloy with Gold plating for \
             the metal parts. This indicates full compatibility in terms of material composition.",
            GREEN,
        ),
        Entry::new(
            ago(60),
            "System",
            "Not a match: ❌ Number of pins: The reference component has 4 pins, while the candidate \
             component has 5 pins. For connectors, the number of pins must match exactly to ensure \
             compatibility. Therefore, the candidate component is not compatible with the reference \
             component.",
            RED,
        ),
        Entry::new(ago(45), "Alice", "Project status update ✅ - All tasks completed on time!", GREEN),
        Entry::new(ago(30), "Bob", "Need to review the latest changes 📚", RED),
        Entry::new(ago(20), "Charlie", "Documentation updated ❌: with new features", BLUE),
        Entry::new(ago(10), "Alice", "Tests passing with 100% coverage 🎯", GREEN),
        Entry::new(ago(5), "Bob", "Ready for deployment! 🚀", GREEN),
    ]
}
