use fosamap::dashboard::update_map;
use fosamap::dataset;
use fosamap::filter::FilterCriteria;
use fosamap::markers::MarkerStyle;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let data = dataset::load("./fosas_with_url.csv").await?;
    let criteria = FilterCriteria {
        region: Some("Andalucía".to_string()),
        person_range: Some("+100".to_string()),
        ..FilterCriteria::default()
    };
    let markers = update_map(data.records(), &criteria, &MarkerStyle::default());

    println!("Records: {}", data.len());
    println!("Skipped: {}", data.report().skipped.len());
    println!("Markers: {}", markers.len());
    for m in markers.iter() {
        println!("{} {:.5},{:.5} {:.2}", m.tooltip, m.position.lat, m.position.lon, m.radius);
    }

    Ok(())
}
