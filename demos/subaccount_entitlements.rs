use btp_accounts::api::types::service_key::ServiceKey;
use btp_accounts::BtpAccounts;
use std::process::exit;

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <service-key.json> <subaccount-id>", args[0]);
        exit(1);
    }

    let key = match ServiceKey::from_file(&args[1]) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    let mut btp = match BtpAccounts::new(key) {
        Ok(btp) => btp,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    if let Err(e) = btp.login().await {
        eprintln!("Login failed: {}", e);
        exit(1);
    }

    match btp.subaccount_entitlements(&args[2]).await {
        Ok(entitlements) => {
            println!(
                "Entitlements owned by {} ({})",
                entitlements.parent.id,
                if entitlements.parent.is_global_account {
                    "global account"
                } else {
                    "directory"
                }
            );
            for (key, e) in entitlements.iter() {
                println!(
                    "{:<50} assigned {:>8} remaining {:>8}  {}",
                    key.to_string(),
                    e.quota_assigned,
                    e.quota_remaining,
                    e.plan_description
                );
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}
