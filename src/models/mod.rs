// Domain models shared by the engine, the worker and the presentation adapter

mod alert;
mod metric;
mod snapshot;
mod view;

pub use alert::AlertEvent;
pub use metric::{AlertMetric, Metric};
pub use snapshot::{RawSample, Snapshot};
pub use view::{EngineView, HistorySummary, SamplingStatus, SeriesSummary};
