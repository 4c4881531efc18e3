mod integration;
mod status;
