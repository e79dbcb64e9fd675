use handlebars::{Handlebars, TemplateError};
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

pub const PRINT_ORDERS: &str = "print/orders";

pub fn build_handlebars() -> Result<Hbs, TemplateError> {
    let mut hb = Handlebars::new();
    // compiled in so the binary and the tests don't depend on the working directory
    hb.register_template_string(
        PRINT_ORDERS,
        include_str!("../../templates/print/orders.hbs"),
    )?;

    Ok(Arc::new(hb))
}
