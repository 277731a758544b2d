mod common;

mod partition;
mod routing;
mod workflow;
