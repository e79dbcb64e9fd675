pub mod note;
pub mod order;
pub mod page;
pub mod upstream;

pub use note::OrderNote;
pub use order::{Address, ItemImage, LineItem, MetaData, Order, ShippingLine};
pub use page::{AllOrders, OrderCounts, OrdersPage, PageRequest};
pub use upstream::UpstreamPage;
