use geopicker::prelude::*;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Serves exactly one canned HTTP reply on a local port and hands back the
/// raw request head it received
fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/reverse", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let _ = tx.send(head);

        let mut stream = stream;
        let reply = format!(
            "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    (endpoint, rx)
}

fn geocoder_for(endpoint: String) -> NominatimGeocoder {
    NominatimGeocoder::with_client(
        reqwest::Client::new(),
        GeocoderConfig::default()
            .with_endpoint(endpoint)
            .with_user_agent("geopicker-tests/0.1"),
    )
}

#[cfg(test)]
mod nominatim_http {
    use super::*;

    #[tokio::test]
    async fn test_resolves_address_over_http() {
        let (endpoint, request) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"place_id":42,"address":{"city":"New York","state":"New York","country":"United States"}}"#,
        );

        let address = geocoder_for(endpoint)
            .resolve(LatLng::new(40.730610, -73.935242))
            .await
            .unwrap();
        assert_eq!(
            address,
            Some(Address::new("New York", "New York", "United States"))
        );

        let head = request.recv().unwrap().to_lowercase();
        assert!(head.starts_with("get /reverse?"));
        assert!(head.contains("lat=40.73061"));
        assert!(head.contains("lon=-73.935242"));
        assert!(head.contains("zoom=18"));
        assert!(head.contains("addressdetails=1"));
        assert!(head.contains("namedetails=1"));
        assert!(head.contains("accept-language: en-us,en;q=0.9"));
        assert!(head.contains("user-agent: geopicker-tests/0.1"));
    }

    #[tokio::test]
    async fn test_server_error_is_a_status_error() {
        let (endpoint, _request) =
            serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"boom"}"#);

        let result = geocoder_for(endpoint)
            .resolve(LatLng::new(10.0, 10.0))
            .await;
        assert!(matches!(result, Err(PickerError::Status { status: 500 })));
    }

    #[tokio::test]
    async fn test_unlocatable_point_is_no_address() {
        let (endpoint, _request) =
            serve_once("HTTP/1.1 200 OK", r#"{"error":"Unable to geocode"}"#);

        let result = geocoder_for(endpoint)
            .resolve(LatLng::new(-48.876667, -123.393333))
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_serialization_error() {
        let (endpoint, _request) = serve_once("HTTP/1.1 200 OK", "<html>not json</html>");

        let result = geocoder_for(endpoint)
            .resolve(LatLng::new(1.0, 1.0))
            .await;
        assert!(matches!(result, Err(PickerError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/reverse", listener.local_addr().unwrap());
        drop(listener);

        let result = geocoder_for(endpoint)
            .resolve(LatLng::new(1.0, 1.0))
            .await;
        assert!(matches!(result, Err(PickerError::Network(_))));
    }
}
