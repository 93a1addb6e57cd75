use std::sync::Arc;

use crate::{
    application::{
        ports::{
            ChatModel, DocumentLoader, EmbeddingProvider, JobQueue, StatusStore, UrlProbe,
        },
        services::{ChatService, IngestionService, RateLimiter, RetrievalService},
        use_cases::{
            CancelIngestionUseCase, ChatWithDocumentsUseCase, DispatchMode,
            GetIngestionStatusUseCase, SubmitFileUseCase, SubmitUrlUseCase,
        },
    },
    domain::repositories::{ChatHistoryRepository, VectorRepository},
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::{
                PostgresChatHistoryRepository, PostgresStatusStore, PostgresVectorRepository,
            },
            run_migrations,
        },
        external_services::{
            HttpChatModel, HttpUrlProbe, InferenceEmbeddingProvider, RecursiveCharacterSplitter,
            document_loaders::CompositeDocumentLoader,
        },
        file_system::UploadStore,
        messaging::{IngestionWorkerPool, JobRunner, MpscJobQueue, RetentionSweeper},
    },
    presentation::http::handlers::{ChatHandler, IngestionHandler},
};

const DEFAULT_WORKER_COUNT: usize = 3;

/// Every client and repository is constructed exactly once here, at
/// process start, and shared read-only through `Arc` handles.
pub struct AppContainer {
    // Stores
    pub status_store: Arc<dyn StatusStore>,
    pub vector_repository: Arc<dyn VectorRepository>,
    pub chat_history_repository: Arc<dyn ChatHistoryRepository>,

    // External services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub chat_model: Arc<dyn ChatModel>,
    pub document_loader: Arc<dyn DocumentLoader>,
    pub url_probe: Arc<dyn UrlProbe>,
    pub upload_store: Arc<UploadStore>,

    // Job Queue and Background Processing
    pub job_queue: Arc<dyn JobQueue>,
    pub worker_pool: Arc<IngestionWorkerPool>,
    pub retention_sweeper: Arc<RetentionSweeper>,

    // Application Services
    pub ingestion_service: Arc<IngestionService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub chat_service: Arc<ChatService>,
    pub rate_limiter: Arc<RateLimiter>,

    // Use Cases
    pub submit_file_use_case: Arc<SubmitFileUseCase>,
    pub submit_url_use_case: Arc<SubmitUrlUseCase>,
    pub get_status_use_case: Arc<GetIngestionStatusUseCase>,
    pub cancel_use_case: Arc<CancelIngestionUseCase>,
    pub chat_use_case: Arc<ChatWithDocumentsUseCase>,

    // HTTP Handlers
    pub ingestion_handler: Arc<IngestionHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create database connection pool and run migrations
        let db_pool = create_connection_pool()?;
        let mut conn = get_connection_from_pool(&db_pool)?;
        run_migrations(&mut conn)?;
        drop(conn);

        // Create stores
        let status_store: Arc<dyn StatusStore> =
            Arc::new(PostgresStatusStore::new(db_pool.clone()));
        let vector_repository: Arc<dyn VectorRepository> =
            Arc::new(PostgresVectorRepository::new(db_pool.clone()));
        let chat_history_repository: Arc<dyn ChatHistoryRepository> =
            Arc::new(PostgresChatHistoryRepository::new(db_pool));

        // Create external services
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(InferenceEmbeddingProvider::from_env()?);
        let chat_model: Arc<dyn ChatModel> = Arc::new(HttpChatModel::from_env()?);
        let document_loader: Arc<dyn DocumentLoader> = Arc::new(CompositeDocumentLoader::new()?);
        let url_probe: Arc<dyn UrlProbe> = Arc::new(HttpUrlProbe::new()?);
        let upload_store = Arc::new(UploadStore::from_env());

        // Create the ingestion pipeline and the runner shared by the
        // worker pool and the inline dispatch mode
        let ingestion_service = Arc::new(IngestionService::new(
            document_loader.clone(),
            RecursiveCharacterSplitter::default(),
            embedding_provider.clone(),
            vector_repository.clone(),
        ));
        let job_runner = Arc::new(JobRunner::new(
            ingestion_service.clone(),
            status_store.clone(),
        ));

        // Create job queue and worker pool
        let (job_queue, job_receiver) = MpscJobQueue::create_pair();
        let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);

        let worker_count = std::env::var("WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WORKER_COUNT);
        let worker_pool = Arc::new(
            IngestionWorkerPool::new(Arc::new(job_receiver), job_runner.clone())
                .with_worker_count(worker_count),
        );

        let retention_sweeper = Arc::new(RetentionSweeper::from_env(vector_repository.clone()));

        // Create use cases
        let dispatch_mode = DispatchMode::from_env();

        let submit_file_use_case = Arc::new(SubmitFileUseCase::new(
            upload_store.clone(),
            status_store.clone(),
            job_queue.clone(),
            job_runner.clone(),
            dispatch_mode,
        ));

        let submit_url_use_case = Arc::new(SubmitUrlUseCase::new(
            url_probe.clone(),
            status_store.clone(),
            job_queue.clone(),
            job_runner,
            dispatch_mode,
        ));

        let get_status_use_case = Arc::new(GetIngestionStatusUseCase::new(status_store.clone()));

        let cancel_use_case = Arc::new(CancelIngestionUseCase::new(job_queue.clone()));

        // Create retrieval and chat services
        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            vector_repository.clone(),
        ));

        let chat_service = Arc::new(ChatService::new(
            retrieval_service.clone(),
            chat_model.clone(),
            chat_history_repository.clone(),
        ));

        let chat_use_case = Arc::new(ChatWithDocumentsUseCase::new(chat_service.clone()));

        let rate_limiter = Arc::new(RateLimiter::new(status_store.clone()));

        // Create HTTP handlers
        let ingestion_handler = Arc::new(IngestionHandler::new(
            submit_file_use_case.clone(),
            submit_url_use_case.clone(),
            get_status_use_case.clone(),
            cancel_use_case.clone(),
            rate_limiter.clone(),
        ));

        let chat_handler = Arc::new(ChatHandler::new(chat_use_case.clone(), rate_limiter.clone()));

        Ok(Self {
            status_store,
            vector_repository,
            chat_history_repository,
            embedding_provider,
            chat_model,
            document_loader,
            url_probe,
            upload_store,
            job_queue,
            worker_pool,
            retention_sweeper,
            ingestion_service,
            retrieval_service,
            chat_service,
            rate_limiter,
            submit_file_use_case,
            submit_url_use_case,
            get_status_use_case,
            cancel_use_case,
            chat_use_case,
            ingestion_handler,
            chat_handler,
        })
    }
}
