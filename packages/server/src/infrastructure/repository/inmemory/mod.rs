//! インメモリ Repository 実装
//!
//! プロセス再起動をまたいだ永続化は行いません。

mod connection;
mod history;

pub use connection::InMemoryConnectionRepository;
pub use history::InMemoryHistoryRepository;
