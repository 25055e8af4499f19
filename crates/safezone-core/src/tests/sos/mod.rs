mod activation;
mod payload;
