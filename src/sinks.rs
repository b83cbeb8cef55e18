mod configured_sink;
mod http_sink;
mod log_sink;
mod measurement_sink;

pub use self::{
    configured_sink::ConfiguredSink, http_sink::HttpSink, log_sink::LogSink,
    measurement_sink::MeasurementSink,
};
