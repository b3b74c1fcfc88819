//! Order form with quantity stepper: `storefront buy`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use storefront::client::{Form, IntakeClient, OrderForm, Pricing};
use storefront::config::StorefrontConfig;
use storefront::ui::icons::{CART, TRUCK};

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
];

const INCREASE: &str = "+ Increase";
const DECREASE: &str = "- Decrease";
const ENTER: &str = "Enter a number";
const DONE: &str = "Done";

pub async fn cmd_buy(
    config: &StorefrontConfig,
    name: Option<String>,
    phone: Option<String>,
    quantity: Option<i64>,
) -> Result<()> {
    let client = IntakeClient::new(config.server_url())?;
    let pricing = config.pricing();
    let interactive = submit::is_interactive();

    let mut form = Form::<OrderForm>::new();
    submit::prefill(&mut form, vec![("name", name), ("phone", phone)]);
    // A flag value goes to validation unchanged; only the interactive
    // stepper clamps.
    let quantity_given = quantity.is_some();
    if let Some(quantity) = quantity {
        form.set("quantity", quantity);
    }

    if interactive {
        println!();
        println!("{}{}", CART, style("Place an Order").bold());
        println!(
            "Unit price {}. {}Free shipping on every order.",
            pricing.unit_price(),
            TRUCK
        );
        println!();
    }

    let mut choose_quantity = !quantity_given;
    loop {
        if interactive {
            submit::prompt_text_fields(&mut form, FIELDS)?;
            if choose_quantity || form.field_error("quantity").is_some() {
                pick_quantity(&mut form, &pricing)?;
            }
            print_summary(&form, &pricing);
        }

        match submit::submit_once(&mut form, &client, interactive, "Placing order...").await? {
            Step::Done(order) => {
                println!(
                    "   {}",
                    style(format!("Order {} for {} item(s)", order.id, order.quantity)).dim()
                );
                return Ok(());
            }
            Step::Retry => choose_quantity = false,
        }
    }
}

/// Stepper loop: `+`/`-` buttons and free-text entry until the user is done.
fn pick_quantity(form: &mut Form<OrderForm>, pricing: &Pricing) -> Result<()> {
    loop {
        let stepper = form.stepper();
        let subtotal = form.price_summary(pricing).subtotal;

        let mut items = vec![INCREASE];
        if stepper.can_decrement() {
            items.push(DECREASE);
        }
        items.extend([ENTER, DONE]);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Quantity: {} ({})", stepper.value(), subtotal))
            .items(&items[..])
            .default(items.len() - 1)
            .interact()
            .context("Failed to read quantity")?;

        match items[selection] {
            INCREASE => form.increment_quantity(),
            DECREASE => form.decrement_quantity(),
            ENTER => {
                let text: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Quantity")
                    .with_initial_text(stepper.value().to_string())
                    .allow_empty(true)
                    .interact_text()
                    .context("Failed to read quantity")?;
                form.input_quantity(&text);
            }
            _ => return Ok(()),
        }
    }
}

fn print_summary(form: &Form<OrderForm>, pricing: &Pricing) {
    let summary = form.price_summary(pricing);

    println!();
    println!("{}", style("Order Summary").bold());
    println!("  {:<14}{:>12}", "Unit price", pricing.unit_price().to_string());
    println!("  {:<14}{:>12}", "Quantity", summary.quantity);
    println!("  {:<14}{:>12}", "Subtotal", summary.subtotal.to_string());
    println!("  {:<14}{}", "Shipping", style(format!("{:>12}", "FREE")).green());
    println!(
        "  {}{}",
        style(format!("{:<14}", "Total")).bold(),
        style(format!("{:>12}", summary.total.to_string())).bold()
    );
    println!();
}
