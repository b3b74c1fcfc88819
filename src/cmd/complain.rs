//! Complaint form: `storefront complain`.

use anyhow::Result;
use console::style;

use storefront::client::{ComplaintForm, Form, IntakeClient};
use storefront::config::StorefrontConfig;
use storefront::ui::icons::PENCIL;

use super::submit::{self, Step, TextField};

const FIELDS: &[TextField] = &[
    TextField {
        name: "name",
        label: "Name",
    },
    TextField {
        name: "phone",
        label: "Phone number",
    },
    TextField {
        name: "complaint",
        label: "Complaint",
    },
];

pub async fn cmd_complain(
    config: &StorefrontConfig,
    name: Option<String>,
    phone: Option<String>,
    complaint: Option<String>,
) -> Result<()> {
    let client = IntakeClient::new(config.server_url())?;
    let interactive = submit::is_interactive();

    let mut form = Form::<ComplaintForm>::new();
    submit::prefill(
        &mut form,
        vec![("name", name), ("phone", phone), ("complaint", complaint)],
    );

    if interactive {
        println!();
        println!("{}{}", PENCIL, style("Submit a Complaint").bold());
        println!("We're sorry to hear you had a problem. Tell us what happened.");
        println!();
    }

    loop {
        if interactive {
            submit::prompt_text_fields(&mut form, FIELDS)?;
        }

        match submit::submit_once(&mut form, &client, interactive, "Submitting complaint...").await? {
            Step::Done(complaint) => {
                println!("   {}", style(format!("Reference: {}", complaint.id)).dim());
                return Ok(());
            }
            Step::Retry => continue,
        }
    }
}
