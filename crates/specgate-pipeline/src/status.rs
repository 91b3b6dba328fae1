//! Process exit contract with the CI wrapper.

/// The sole output contract with the invoking automation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// No violations, or violations covered by exemption/override
    Pass,
    /// Breaking changes without a valid override
    PolicyFail,
    /// Malformed input, dangling reference, corrupt snapshot, or invalid
    /// override token
    InputError,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Pass => 0,
            ExitStatus::PolicyFail => 1,
            ExitStatus::InputError => 2,
        }
    }
}
