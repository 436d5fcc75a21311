pub mod file;
pub mod http;
pub mod traits;

pub use file::FileTransactionStep;
pub use http::HttpTransactionStep;
pub use traits::{TransactionReceipt, TransactionStep};
