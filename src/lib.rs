//! ukvax
//!
//! A lightweight Rust library for retrieving UK COVID-19 vaccination counts from the
//! coronavirus dashboard API, reshaping them into a tidy table, and charting them by
//! nation. Pairs with the `ukvax` CLI.
//!
//! ### Features
//! - Fetch per-nation cumulative first/second dose counts (paginated, typed rows)
//! - Melt the wide table into one observation per (nation, stage, date)
//! - Render one subplot row per nation to PNG or SVG, styled by a [`viz::Theme`] preset
//! - Optionally save the long-form table as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use ukvax::{Client, reshape, viz};
//!
//! let client = Client::default();
//! let wide = client.fetch_vaccinations()?;
//! let long = reshape::melt(&wide);
//! ukvax::storage::save_csv(&long, "vaccinations.csv")?;
//! let layout = viz::plot_vaccinations(&long, viz::DEFAULT_OUTPUT, &viz::Theme::standard())?;
//! println!("{} nations", layout.facet_count());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod models;
pub mod reshape;
pub mod storage;
pub mod viz;

pub use api::{Client, ClientOptions, Query};
pub use models::{DoseStage, Observation, VaccinationRecord};
