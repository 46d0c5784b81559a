use storefront::{context::StorefrontContext, pricing::format_price};
use tabled::builder::Builder;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let page = context
        .api
        .list_products()
        .await
        .map_err(|failure| super::describe_failure(context, &failure))?;

    let mut builder = Builder::default();

    builder.push_record(["SKU", "Name", "Category", "Price"]);

    for product in &page.items {
        builder.push_record([
            product.sku.clone(),
            product.name.clone(),
            product.category.clone(),
            format_price(product.price, &context.options.currency)
                .map_err(|error| format!("failed to format price of {}: {error}", product.sku))?,
        ]);
    }

    super::write_table(builder.build())
}
