pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: Option<String>,
        frontend_url: String,
        production: bool,
    },
}
