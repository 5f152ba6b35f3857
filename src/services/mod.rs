pub(crate) mod attendance;
pub(crate) mod catalog;
pub(crate) mod error;
pub(crate) mod grid;
pub(crate) mod ranking;
pub(crate) mod reconcile;
pub(crate) mod reports;
pub(crate) mod scale;
pub(crate) mod subject_order;
