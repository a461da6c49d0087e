pub mod ask;
pub mod catalog_route;
pub mod documents;
pub mod save;
pub mod session;

#[cfg(test)]
mod tests;
