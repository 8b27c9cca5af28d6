pub use admin_console::reconcile::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    admin_console::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
