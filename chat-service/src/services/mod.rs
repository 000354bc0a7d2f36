pub mod slack_service;
