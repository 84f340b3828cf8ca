//! End-to-end scenarios for round generation, driven through an in-memory
//! registry.

#[cfg(test)]
mod support;

#[cfg(test)]
mod generation;

#[cfg(test)]
mod rounds;
