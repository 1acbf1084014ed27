pub(crate) mod chart;
pub(crate) mod footer;
pub(crate) mod indicator;
pub(crate) mod modals;
pub(crate) mod padding;
pub(crate) mod separator;
