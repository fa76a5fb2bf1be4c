use dotenvy::dotenv;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Company identity stamped into the statutory export header.
    pub company_name: String,
    pub company_fiscal_id: String,
    pub company_cnss_affiliation: String,
    /// Leave days granted per elapsed employment month.
    pub monthly_accrual_days: Decimal,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Demo Company".to_string()),
            company_fiscal_id: env::var("COMPANY_FISCAL_ID")
                .unwrap_or_else(|_| "00000000".to_string()),
            company_cnss_affiliation: env::var("COMPANY_CNSS_AFFILIATION")
                .unwrap_or_else(|_| "0000000".to_string()),
            monthly_accrual_days: env::var("MONTHLY_ACCRUAL_DAYS")
                .unwrap_or_else(|_| "1.5".to_string())
                .parse()
                .unwrap_or(dec!(1.5)),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
