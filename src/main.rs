#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    legacy_planner_server::run().await
}
