// tablebook-client/examples/browse.rs
// 浏览示例: 恢复会话 → 登录 → 刷新餐厅列表 → 预订第一个可用时段
//
// Usage: cargo run -p tablebook-client --example browse -- <email> <password> [search]

use tablebook_client::logger::init_logger;
use tablebook_client::{BookingApp, ClientConfig, RootArea, SubmitOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger("info");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <email> <password> [search]", args[0]);
        return Ok(());
    }
    let (email, password) = (&args[1], &args[2]);
    let search = args.get(3).map(String::as_str);

    let config = ClientConfig::from_env();
    let app = BookingApp::new(&config)?;

    if app.start().await == RootArea::Unauthenticated {
        let user = app.session().login(email, password).await?;
        tracing::info!("Logged in as {} ({})", user.name, user.role);
    }
    tracing::info!("Root area: {:?}", app.router().current());

    let count = app.catalog().refresh().await?;
    tracing::info!("Loaded {} restaurants", count);

    let matches = app.catalog().filter(search, None);
    for restaurant in &matches {
        println!(
            "{:<24} {:<12} {:<16} {} slots",
            restaurant.name,
            restaurant.cuisine,
            restaurant.location,
            restaurant.slots.len()
        );
    }

    let Some((restaurant, slot)) = matches
        .iter()
        .find_map(|r| r.slots.iter().find(|s| s.capacity > 0).map(|s| (r, s)))
    else {
        println!("No bookable slot found");
        return Ok(());
    };

    let flow = app.open_restaurant(&restaurant.id).await?;
    flow.select_slot(slot)?;
    match flow.submit().await? {
        SubmitOutcome::Reserved(handoff) => println!(
            "Reserved {} at {} ({}), continue to payment",
            handoff.reservation_id, restaurant.name, handoff.slot.date
        ),
        SubmitOutcome::Failed(message) => println!("Reservation failed: {message}"),
        other => println!("Reservation not completed: {other:?}"),
    }

    app.session().flush().await;
    Ok(())
}
