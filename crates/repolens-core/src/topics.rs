/// Discovery keywords rotated by the ingestion scheduler, in rotation order.
pub const DEFAULT_TOPICS: &[&str] = &[
    "AI Agent",
    "LLM",
    "RAG",
    "Vector Database",
    "Langchain",
    "Ollama",
    "Stable Diffusion",
    "Data Engineering",
    "Microservices",
    "Self-Hosting",
    "DevOps",
    "Serverless",
    "GraphQL",
    "WebAssembly",
    "Rust",
    "Golang",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Spring Boot",
    "Next.js",
    "Django",
    "Flutter",
    "FastAPI",
];
