pub mod flow;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Register {
        globals: GlobalArgs,
    },
    Login {
        globals: GlobalArgs,
        /// `Some` toggles the persisted preference; `None` leaves it as is.
        remember_me: Option<bool>,
    },
    Recover {
        globals: GlobalArgs,
    },
}
