use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use travel_with_me::app::{AppServices, Repositories};
use travel_with_me::domain::feed::FeedResponse;
use travel_with_me::domain::member::Member;
use travel_with_me::infrastructure::config::{Config, Environment, LogFormat};
use travel_with_me::infrastructure::http::build_router;
use travel_with_me::infrastructure::repositories::InMemoryStore;

pub mod assertions;
pub mod db_pool;

use api_client::{TestClient, TokenPair};
use db_pool::TestDatabase;
use fixtures::TestFixtures;
use stub_data::{MockFeed, MockMember};

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub services: AppServices,
    pub fixtures: TestFixtures,
    /// Backing Postgres database, when the context runs against one
    pub database: Option<TestDatabase>,
    _upload_dir: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
            TestContext::start(repos, None).await
        }
    }
}

impl TestContext {
    /// Serve `repos` on an OS-assigned port with a fresh upload directory
    pub async fn start(repos: Repositories, database: Option<TestDatabase>) -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        // Create test configuration
        let config = Config {
            database_url: database.as_ref().map(|db| db.url.clone()),
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            jwt_secret: "test-jwt-secret-key-for-testing-only".to_string(),
            jwt_expiration_hours: 1,
            refresh_token_expiration_days: 14,
            aes_secret_key: "travel-test-key!".to_string(),
            upload_dir: upload_dir.path().to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
        };

        let services = AppServices::new(&config, &repos).expect("Failed to create services");
        let app = build_router(&config, &services, repos.pool.clone());

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TestClient::new(&base_url);
        let fixtures = TestFixtures::new(services.clone());

        Self {
            client,
            config,
            services,
            fixtures,
            database,
            _upload_dir: upload_dir,
        }
    }

    /// Fabricate the token pair a logged-in client would hold
    pub async fn issue_tokens(&self, member: &Member) -> TokenPair {
        let tokens = self
            .services
            .auth
            .create_tokens_for_member(member)
            .await
            .expect("Failed to issue tokens");

        TokenPair::new(tokens.access_token, tokens.refresh_token)
    }

    /// Token pair whose access token is already expired but whose refresh token is valid
    pub async fn issue_expired_tokens(&self, member: &Member) -> TokenPair {
        let valid = self.issue_tokens(member).await;
        let expired_access = self
            .services
            .auth
            .jwt()
            .generate_token_with_expiry(member.id, &member.email, Utc::now() - Duration::hours(2))
            .expect("Failed to sign expired token");

        TokenPair::new(expired_access, valid.refresh_token.unwrap_or_default())
    }

    pub fn upload_path(&self, image_url: &str) -> std::path::PathBuf {
        let stored = image_url
            .rsplit('/')
            .next()
            .expect("image url has a file name");
        self.config.upload_dir.join(stored)
    }
}

/// Context for feed scenarios: a member, the tags `TAG_NAME1`/`TAG_NAME2`
/// and one feed written by that member, seeded through the service layer.
pub struct FeedTestContext {
    pub base: TestContext,
    pub member: Member,
    pub tokens: TokenPair,
    pub feed: FeedResponse,
}

impl AsyncTestContext for FeedTestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { FeedTestContext::seed(TestContext::setup().await).await }
    }
}

impl FeedTestContext {
    pub async fn seed(base: TestContext) -> Self {
        let member = base
            .fixtures
            .create_member(MockMember::sign_up_request())
            .await
            .expect("Failed to seed member");
        base.fixtures
            .create_tags(&[MockFeed::tag_name(1), MockFeed::tag_name(2)])
            .await
            .expect("Failed to seed tags");
        let feed = base
            .fixtures
            .create_feed(member.id, MockFeed::post_dto())
            .await
            .expect("Failed to seed feed");
        let tokens = base.issue_tokens(&member).await;

        Self {
            base,
            member,
            tokens,
            feed,
        }
    }

    pub fn client(&self) -> &TestClient {
        &self.base.client
    }

    pub fn feed_path(&self) -> String {
        format!("/feed/{}", self.feed.id)
    }

    pub fn likes_path(&self) -> String {
        format!("/feed/{}/likes", self.feed.id)
    }

    /// A second member with their own token pair
    pub async fn other_member(&self) -> (Member, TokenPair) {
        let member = self
            .base
            .fixtures
            .create_member(MockMember::other_sign_up_request())
            .await
            .expect("Failed to seed second member");
        let tokens = self.base.issue_tokens(&member).await;
        (member, tokens)
    }
}

/// Feed scenarios served by the Postgres repositories inside a container
pub struct PgFeedTestContext(FeedTestContext);

impl AsyncTestContext for PgFeedTestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let database = db_pool::create_database()
                .await
                .expect("Failed to create test database");
            let repos = Repositories::postgres(database.pool.clone());
            let base = TestContext::start(repos, Some(database)).await;
            PgFeedTestContext(FeedTestContext::seed(base).await)
        }
    }
}

impl PgFeedTestContext {
    pub fn database(&self) -> &TestDatabase {
        self.0
            .base
            .database
            .as_ref()
            .expect("Postgres context always has a database")
    }
}

impl std::ops::Deref for PgFeedTestContext {
    type Target = FeedTestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
