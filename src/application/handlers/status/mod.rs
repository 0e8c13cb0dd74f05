//! Status workflow command handlers.

mod change_status;

pub use change_status::{
    ChangeStatusCommand, ChangeStatusError, ChangeStatusHandler, ChangeStatusResult,
};
