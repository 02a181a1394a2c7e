#![allow(dead_code)]

use chrono::{Duration, Utc};
use gphotos_manifest::{
    google::OAuthClient,
    types::{ClientDescriptor, MediaItem, Token},
};
use reqwest::{Client, Url};
use serde_json::{Map, Value, json};

pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn descriptor(token_base: &str, redirect: &str) -> ClientDescriptor {
    ClientDescriptor {
        client_id: "client-123.apps.googleusercontent.com".to_string(),
        client_secret: "shh".to_string(),
        auth_endpoint: Url::parse("https://accounts.example.com/o/oauth2/auth").unwrap(),
        token_endpoint: Url::parse(&format!("{token_base}/token")).unwrap(),
        redirect_uri: Url::parse(redirect).unwrap(),
    }
}

pub fn oauth_client(token_base: &str, redirect: &str) -> OAuthClient {
    OAuthClient::new(
        Client::new(),
        descriptor(token_base, redirect),
        "https://www.googleapis.com/auth/photoslibrary.readonly",
    )
}

pub fn fresh_token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expiry: Some(Utc::now() + Duration::hours(1)),
    }
}

pub fn expired_token(access: &str, refresh: Option<&str>) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.map(str::to_string),
        expiry: Some(Utc::now() - Duration::hours(1)),
    }
}

pub fn item(n: usize) -> MediaItem {
    let mut fields = Map::new();
    fields.insert("filename".to_string(), json!(format!("IMG_{n:04}.jpg")));
    fields.insert("mimeType".to_string(), json!("image/jpeg"));
    fields.insert(
        "mediaMetadata".to_string(),
        json!({"creationTime": "2021-06-01T10:00:00Z", "width": "4032", "height": "3024"}),
    );
    MediaItem {
        id: format!("item-{n}"),
        fields,
    }
}

pub fn item_json(n: usize) -> Value {
    serde_json::to_value(item(n)).unwrap()
}

pub fn ids(items: &[MediaItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}
