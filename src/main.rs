use radio_gateway::init_logger;

/// Minimal host binary. Wiring a `ModemPort` to a real serial device,
/// parsing a config file, and standing up the network peer protocol are
/// all embedder concerns this crate intentionally does not own.
fn main() {
    init_logger();
    log::info!("gateway core library loaded; wire a ModemPort/Network/Acl/Affiliations to run a session");
}
