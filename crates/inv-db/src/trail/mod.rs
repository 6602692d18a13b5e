//! JSONL trail writer.
//!
//! Every mutation is appended to a per-day JSONL file under the trail
//! directory (`.inventory/trail/` by default). The trail outlives database
//! resets and can be tailed or grepped without opening the database.

pub mod writer;
