use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use tracing::debug;

/// Connection settings for the DynamoDB client
#[derive(Debug, Clone, Default)]
pub struct DynamoDbClientConfig {
    /// Endpoint override, e.g. a DynamoDB Local container
    pub endpoint_url: Option<String>,
}

/// Build a DynamoDB client from the ambient AWS configuration (region, credentials)
pub async fn connect_dynamodb(config: &DynamoDbClientConfig) -> Client {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using DynamoDB endpoint override");
        builder = builder.endpoint_url(endpoint);
    }

    Client::from_conf(builder.build())
}
