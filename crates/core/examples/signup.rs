//! A sign-up form driven by simulated keystrokes.
//!
//! ```sh
//! FLOWFORMS_LOG=flowforms_core=debug cargo run -p flowforms-core --example signup
//! ```

use std::time::Duration;

use flowforms_core::prelude::*;
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log = flowforms_log::init()?;

    let taken = ["admin", "root"];
    let form = Form::builder()
        .field(FieldSpec::new("name").validation(Required::new()))
        .field(
            FieldSpec::new("username")
                .validation(Required::new())
                .validation(MatchRegex::new("[a-z][a-z0-9_]{2,15}")?)
                .validation(
                    Custom::from_async(move |ctx| async move {
                        // Stand-in for a remote availability check.
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        let name = ctx.value().to_string();
                        Ok(!taken.contains(&name.as_str()))
                    })
                    .with_code(StatusCode::Custom("USERNAME_TAKEN")),
                ),
        )
        .field(
            FieldSpec::new("email")
                .validation(Required::new())
                .validation(BasicEmailFormat::new()),
        )
        .field(
            FieldSpec::new("new_password")
                .validation(Required::new())
                .validation(MinLength::new(8)),
        )
        .field(FieldSpec::confirmation("confirm_password", "new_password").validation(Required::new()))
        .field(FieldSpec::new("terms").validation(RequiredTrue::new()))
        .build()?;

    // The "Sign up" button follows the form status.
    let mut statuses = form.subscribe();
    let button = tokio::spawn(async move {
        while let Some(status) = statuses.next().await {
            let enabled = status.is_correct();
            println!("form: {status}, button enabled: {enabled}");
        }
    });

    // Typing into the username box; each keystroke supersedes the last check.
    let keystrokes = futures::stream::iter(["a", "ad", "adm", "admi", "admin", "ada"])
        .then(|text| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            text
        });
    let _typing = form.bind("username", keystrokes)?;

    form.set_value("name", "Ada Lovelace")?;
    form.set_value("email", "ada@example")?;
    form.set_value("email", "ada@example.com")?;
    form.set_value("new_password", "analytical")?;
    form.set_value("confirm_password", "analytic")?;
    form.set_value("confirm_password", "analytical")?;

    tokio::time::sleep(Duration::from_secs(1)).await;

    match form.submit().await {
        Ok(status) => println!("submitted early: {status}"),
        Err(FormError::Rejected { status }) => println!("submit rejected: {status}"),
        Err(other) => return Err(other.into()),
    }

    form.set_value("terms", true)?;
    let status = form.submit().await?;
    println!("submitted: {status}");

    drop(form);
    button.await?;
    Ok(())
}
