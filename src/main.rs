use revenda::configuration::get_configuration;
use revenda::connectors;
use revenda::startup::{run, Connectors};
use revenda::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("revenda".into(), "info".into());
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    let baas = connectors::init_baas(&settings.connectors)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let connectors = Connectors {
        baas,
        gateway: connectors::init_mercadopago(&settings.connectors),
        mailer: connectors::init_mailer(&settings.connectors),
    };

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener =
        TcpListener::bind(&address).expect(&format!("failed to bind to {}", settings.app_port));

    run(listener, settings, connectors).await?.await
}
