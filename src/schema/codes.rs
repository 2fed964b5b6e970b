//! Coded response values used across the questionnaire.
//!
//! These enums mirror the vendor codebook; each variant carries the numeric
//! code the response files store for that answer.

/// Five-point financial well-being scale (`Q1` and `Q2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellBeing {
    /// Question not answered
    NotAsked,
    /// Much worse off
    MuchWorse,
    /// Somewhat worse off
    SomewhatWorse,
    /// About the same
    Same,
    /// Somewhat better off
    SomewhatBetter,
    /// Much better off
    MuchBetter,
}

impl WellBeing {
    /// Numeric code stored in the full table
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::NotAsked => -1,
            Self::MuchWorse => 1,
            Self::SomewhatWorse => 2,
            Self::Same => 3,
            Self::SomewhatBetter => 4,
            Self::MuchBetter => 5,
        }
    }
}

/// Employment situation options for the `Q10_*` multi-select block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmploymentStatus {
    /// Working full-time
    FullTime,
    /// Working part-time
    PartTime,
    /// Not working, but would like to work
    NotWorking,
    /// Temporarily laid off
    TempLayoff,
    /// On sick or other leave
    Leave,
    /// Permanently disabled or unable to work
    Disabled,
    /// Retiree or early retiree
    Retired,
    /// Student, at school or in training
    Student,
    /// Homemaker
    Homemaker,
    /// Other
    Other,
}

impl EmploymentStatus {
    /// Option index used in the vendor column name, e.g. `Q10_1`
    #[must_use]
    pub const fn option_index(self) -> u32 {
        match self {
            Self::FullTime => 1,
            Self::PartTime => 2,
            Self::NotWorking => 3,
            Self::TempLayoff => 4,
            Self::Leave => 5,
            Self::Disabled => 6,
            Self::Retired => 7,
            Self::Student => 8,
            Self::Homemaker => 9,
            Self::Other => 10,
        }
    }
}

/// Employer type (`Q12new`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmploymentType {
    /// Works for someone else
    ForSomeoneElse,
    /// Self-employed
    SelfEmployed,
}

impl EmploymentType {
    /// Numeric code in the vendor table
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ForSomeoneElse => 1,
            Self::SelfEmployed => 2,
        }
    }
}

/// Job search status (`Q15`), the gate for the unemployment-duration block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobSearch {
    /// Currently looking for a job
    Looking,
    /// Not looking for a job
    NotLooking,
}

impl JobSearch {
    /// Numeric code in the vendor table
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Looking => 1,
            Self::NotLooking => 2,
        }
    }
}
