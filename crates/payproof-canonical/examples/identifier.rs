use payproof_canonical::{identifier_of, sign_data_of};

fn main() {
    let context = r#"{"providerHash":"0x1111111111111111111111111111111111111111111111111111111111111111","extractedParameters":{"amount":"-1.01"}}"#;

    match identifier_of("http", "{}", context) {
        Ok(identifier) => {
            println!("{}", identifier);
            println!(
                "{}",
                sign_data_of(
                    &identifier,
                    "0xF9F25d1b846625674901Ace47d6313d1ac795265",
                    1_717_390_000,
                    1
                )
            );
        }
        Err(err) => {
            eprintln!("identifier computation failed: {}", err);
            std::process::exit(1);
        }
    }
}
