/*! Turn verification outcomes and scan results into reports.
 *
 * A failing invariant is only useful if the message says which check broke and why. These
 * emitters render outcomes for people (plain or coloured text, near misses on request) and for
 * pipelines (JSON).
 */

pub mod config;
pub mod output;
pub mod scan_report;
pub mod verification_report;

pub use config::{ReportConfig, VerbosityLevel};
pub use output::{JsonFormatter, OutcomeRecord, OutputFormat};
pub use scan_report::ScanReportEmitter;
pub use verification_report::VerificationEmitter;
