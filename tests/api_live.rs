#![cfg(feature = "online")]

use tempfile::tempdir;
use ukvax::viz::{self, Theme};
use ukvax::{Client, reshape};

#[test]
fn live_fetch_nations() {
    let client = Client::default();
    let wide = client.fetch_vaccinations().expect("fetch");
    assert!(!wide.is_empty());
    let long = reshape::melt(&wide);
    assert_eq!(long.len(), 2 * wide.len());
    assert!(long.iter().any(|o| o.nation == "England"));
}

#[test]
fn live_plot() {
    let client = Client::default();
    let long = reshape::melt(&client.fetch_vaccinations().expect("fetch"));
    let dir = tempdir().unwrap();
    let path = dir.path().join("Vaccine count.png");
    let layout = viz::plot_vaccinations(&long, &path, &Theme::standard()).expect("plot");
    assert!(layout.facet_count() >= 1);
    assert!(path.exists());
}
