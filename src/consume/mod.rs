//! Stream consumer subsystem.
//!
//! # Data Flow
//! ```text
//! stream-trigger batch (JSON)
//!     → event.rs (KinesisEvent)
//!     → processor.rs (base64 → Envelope → accept trace → correlated log)
//!     → Vec<ConsumedRecord>
//! ```

pub mod event;
pub mod processor;

pub use event::{KinesisEvent, KinesisEventRecord, KinesisRecordData};
pub use processor::{ConsumeError, ConsumedRecord, RecordProcessor};
