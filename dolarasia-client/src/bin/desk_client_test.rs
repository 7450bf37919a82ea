use std::io::Result;

use dolarasia::convert::Direction;
use dolarasia::desk::CreateTransactionRequest;
use dolarasia::identity::RegisterRequest;
use dolarasia_client::client::desk_v1::HttpClient;
use dolarasia_http::http::desk_v1::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let mut client = HttpClient::new("http://127.0.0.1:8080".to_string());

    let registered = client
        .register(RegisterRequest {
            full_name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Sudirman 1".to_string(),
            id_number: "3174012345678901".to_string(),
            credential: "rahasia1".to_string(),
        })
        .await;

    // A rerun against a file-backed server hits the duplicate email, so fall
    // back to logging in.
    if registered.is_err() {
        let _ = client
            .login("budi@example.com".to_string(), "rahasia1".to_string())
            .await;
    }

    let rates = client.rates().await.unwrap();
    if rates.rates.iter().any(|r| r.code == "USD") {
        let order = CreateTransactionRequest {
            direction: Direction::Buy,
            currency: "USD".to_string(),
            amount: 250_000.0,
            payment_method: "transfer".to_string(),
        };
        let _ = client.preview(order.clone()).await;
        let _ = client.create_transaction(order).await;
    }

    if let Ok(history) = client.history().await {
        println!("{} transactions on record", history.transactions.len());
    }
    Ok(())
}
