#[tokio::main]
async fn main() {
    bookrack::start_server().await;
}
