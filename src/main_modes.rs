mod claimer_mode;
mod pool_modes;

pub(crate) use claimer_mode::run_watch;
pub(crate) use pool_modes::{run_pending, run_status, run_user, run_write};
