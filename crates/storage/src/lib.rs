#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod rest;

#[cfg(test)]
mod tests {
    pub mod data;
}
