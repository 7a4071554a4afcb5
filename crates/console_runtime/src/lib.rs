pub mod catalog;
pub mod gateway;
pub mod host;
pub mod model;
pub mod protocol;
pub mod reducer;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use catalog::{
    create_product, delete_selected_products, refresh_products, set_selected_status,
    test_store_connection, update_product,
};
pub use gateway::{
    CommerceGateway, CommerceGatewayFuture, MemoryCommerceGateway, NoopCommerceGateway,
};
pub use host::{console_persist_options, ConsoleHostContext};
pub use model::*;
pub use protocol::{
    install_dispatcher, request_maximized_window, request_order_alerts_disabled,
    request_order_alerts_enabled, request_order_check, request_order_data, send_console_request,
    ConsoleRequest, ConsoleResponse, MAXIMIZED_PAGE_PATH,
};
pub use reducer::{reduce_console, ConsoleAction, ConsoleEffect, ReducerError};
pub use watcher::{
    check_orders, clear_order_artifacts, install_order_watcher, ORDER_CHECK_ALARM,
    ORDER_CHECK_PERIOD_MINUTES,
};
