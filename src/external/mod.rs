pub mod cost_explorer;
pub mod cost_source;
pub mod mail_transport;
#[cfg(test)]
pub mod mock;
pub mod ses;
pub mod smtp;
