pub mod mock_browser;
pub mod test_server;

pub use mock_browser::MockBrowser;
pub use test_server::TestServer;

pub const TEST_NAME: &str = "Alice";
pub const TEST_EMAIL: &str = "alice@example.com";
pub const TEST_PASSWORD: &str = "correct-horse-battery";
