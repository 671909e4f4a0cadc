//! Storage path naming for file-backed stores.

/// Normalized relative stem for an `(exchange, coin)` key.
///
/// Exchanges are lowercased with spaces collapsed to underscores; coins are
/// uppercased with `/` collapsed to underscores (so `btc/usdt` becomes
/// `BTC_USDT`). The result is `<exchange>/<COIN>` with no extension.
#[must_use]
pub fn storage_stem(exchange: &str, coin: &str) -> String {
    let exchange = exchange.trim().to_lowercase().replace(' ', "_");
    let coin = coin.trim().to_uppercase().replace('/', "_");
    format!("{exchange}/{coin}")
}
