use fosamap::dashboard::{Dashboard, InputEvent, InputId, Options};
use fosamap::dataset;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let data = Arc::new(dataset::load("./fosas_with_url.csv").await?);
    let mut board = Dashboard::new(data, Options::default());

    for input in InputId::ALL {
        println!("{}: {} options", input.label(), input.options(board.options()).len());
    }

    let events = [
        InputEvent::set(InputId::Region, "Aragón"),
        InputEvent::parse("type=Fosa común")?,
        InputEvent::parse("range=30-60")?,
        InputEvent::clear(InputId::GraveType),
    ];
    for event in events {
        let label = format!("{}={}", event.input, event.value.as_deref().unwrap_or(""));
        let markers = board.handle(event);
        println!("{label}: {} markers", markers.len());
    }

    println!("reset: {} markers", board.reset().len());
    Ok(())
}
