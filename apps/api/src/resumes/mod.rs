// Resume records: creation from extracted text, listing, the analysis
// lifecycle (uploaded -> processing -> analyzed | error) and deletion.

pub mod handlers;
pub mod lifecycle;
pub mod store;
