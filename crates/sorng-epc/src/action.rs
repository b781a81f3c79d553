//! Wire action names.
//!
//! Every request carries an `action` form parameter naming the operation.
//! The full vocabulary lives in [`Action`]; [`InstanceAction`] is the subset
//! of lifecycle verbs that callers refer to by short keyword.

use crate::error::EpcError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RunInstances,
    DescribeInstances,
    StartInstances,
    StopInstances,
    RebootInstances,
    TerminateInstances,
    DescribeImages,
    DescribeRegions,
    DescribeShapes,
    DescribeProjects,
    CreateKeyPair,
    DescribeKeyPairs,
    DeleteKeyPair,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunInstances => "run-instances",
            Self::DescribeInstances => "describe-instances",
            Self::StartInstances => "start-instances",
            Self::StopInstances => "stop-instances",
            Self::RebootInstances => "reboot-instances",
            Self::TerminateInstances => "terminate-instances",
            Self::DescribeImages => "describe-images",
            Self::DescribeRegions => "describe-regions",
            Self::DescribeShapes => "describe-shapes",
            Self::DescribeProjects => "describe-projects",
            Self::CreateKeyPair => "create-keypair",
            Self::DescribeKeyPairs => "describe-keypairs",
            Self::DeleteKeyPair => "delete-keypair",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle operations on an existing instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceAction {
    Start,
    Stop,
    Reboot,
    /// Terminates the instance.
    Remove,
}

impl InstanceAction {
    pub const ALL: [InstanceAction; 4] = [Self::Start, Self::Stop, Self::Reboot, Self::Remove];

    pub fn action(&self) -> Action {
        match self {
            Self::Start => Action::StartInstances,
            Self::Stop => Action::StopInstances,
            Self::Reboot => Action::RebootInstances,
            Self::Remove => Action::TerminateInstances,
        }
    }

    /// The short keyword (`start`, `stop`, `reboot`, `remove`).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reboot => "reboot",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for InstanceAction {
    type Err = EpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "reboot" => Ok(Self::Reboot),
            "remove" => Ok(Self::Remove),
            other => Err(EpcError::construction(format!(
                "unknown instance action '{}'",
                other
            ))),
        }
    }
}
