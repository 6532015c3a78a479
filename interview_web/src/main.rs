#[tokio::main]
async fn main() {
    interview_web::run().await;
}
