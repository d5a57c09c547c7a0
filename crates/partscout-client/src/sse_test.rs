use super::*;

// -----------------------------------------------------------------------
// SseDecoder
// -----------------------------------------------------------------------

#[test]
fn decodes_single_frame() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: done\ndata: {}\n\n");
    assert_eq!(
        frames,
        vec![SseFrame {
            event: Some("done".to_owned()),
            data: "{}".to_owned(),
        }]
    );
}

#[test]
fn frame_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: ima").is_empty());
    assert!(decoder.feed(b"ges\ndata: {\"article\":").is_empty());
    let frames = decoder.feed(b"\"W142\",\"images\":[]}\n\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event.as_deref(), Some("images"));
    assert_eq!(frames[0].data, "{\"article\":\"W142\",\"images\":[]}");
}

#[test]
fn multiple_data_lines_are_joined() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: error\ndata: line one\ndata: line two\n\n");
    assert_eq!(frames[0].data, "line one\nline two");
}

#[test]
fn accepts_crlf_and_ignores_comments() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b": keep-alive\r\n\r\nevent: end\r\nid: 7\r\n\r\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event.as_deref(), Some("end"));
    assert_eq!(frames[0].data, "");
}

#[test]
fn several_frames_in_one_chunk() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: done\n\nevent: end\n\n");
    let kinds: Vec<_> = frames.iter().map(|f| f.event.as_deref()).collect();
    assert_eq!(kinds, vec![Some("done"), Some("end")]);
}

#[test]
fn finish_flushes_unterminated_frame() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: end\ndata: x").is_empty());
    let frame = decoder.finish().expect("expected trailing frame");
    assert_eq!(frame.event.as_deref(), Some("end"));
    assert_eq!(frame.data, "x");
    assert!(decoder.finish().is_none());
}

#[test]
fn multibyte_text_split_mid_character() {
    let payload = "event: error\ndata: Ошибка\n\n".as_bytes();
    let (head, tail) = payload.split_at(22);
    let mut decoder = SseDecoder::new();
    let mut frames = decoder.feed(head);
    frames.extend(decoder.feed(tail));
    assert_eq!(frames[0].data, "Ошибка");
}

// -----------------------------------------------------------------------
// SseFrame::into_event
// -----------------------------------------------------------------------

fn frame(event: &str, data: &str) -> SseFrame {
    SseFrame {
        event: Some(event.to_owned()),
        data: data.to_owned(),
    }
}

#[test]
fn item_frame_becomes_item_event() {
    let event = frame(
        "item",
        r#"{"brand":"Bosch","article":"W142","supplier":"A","warehouses":[{"id":1,"name":"Main","price":100,"quantity":5}]}"#,
    )
    .into_event()
    .unwrap();
    match event {
        Some(StreamEvent::Item(item)) => {
            assert_eq!(item.brand, "Bosch");
            assert_eq!(item.warehouses[0].id.as_deref(), Some("1"));
        }
        other => panic!("expected item event, got {other:?}"),
    }
}

#[test]
fn malformed_item_frame_becomes_skipped_item() {
    let event = frame("item", "{not json").into_event().unwrap();
    match event {
        Some(StreamEvent::SkippedItem { reason }) => {
            assert!(reason.contains("item event"), "unexpected reason: {reason}");
        }
        other => panic!("expected skipped item, got {other:?}"),
    }
}

#[test]
fn item_with_one_bad_offer_keeps_the_rest() {
    let event = frame(
        "item",
        r#"{"brand":"Bosch","article":"W142","supplier":"A","warehouses":[{"id":"x","price":null},{"id":"y","price":"95","delivery_days":"2-3"}]}"#,
    )
    .into_event()
    .unwrap();
    match event {
        Some(StreamEvent::Item(item)) => {
            assert_eq!(item.warehouses.len(), 1);
            assert_eq!(item.warehouses[0].id.as_deref(), Some("y"));
            assert_eq!(item.warehouses[0].delivery_days, None);
        }
        other => panic!("expected item event, got {other:?}"),
    }
}

#[test]
fn malformed_images_frame_is_deserialize_error() {
    let err = frame("images", "{not json").into_event().unwrap_err();
    assert!(
        matches!(err, ClientError::Deserialize { ref context, .. } if context == "images event"),
        "expected Deserialize error, got: {err:?}"
    );
}

#[test]
fn error_frame_accepts_plain_text() {
    let event = frame("error", "supplier timeout").into_event().unwrap();
    assert_eq!(
        event,
        Some(StreamEvent::Error(ErrorEvent {
            error: "supplier timeout".to_owned()
        }))
    );
}

#[test]
fn error_frame_accepts_json() {
    let event = frame("error", r#"{"error":"bad article"}"#)
        .into_event()
        .unwrap();
    assert_eq!(
        event,
        Some(StreamEvent::Error(ErrorEvent {
            error: "bad article".to_owned()
        }))
    );
}

#[test]
fn done_and_end_ignore_data() {
    assert_eq!(
        frame("done", "whatever").into_event().unwrap(),
        Some(StreamEvent::Done)
    );
    assert_eq!(frame("end", "").into_event().unwrap(), Some(StreamEvent::End));
}

#[test]
fn unknown_event_is_ignored() {
    assert_eq!(frame("progress", "{}").into_event().unwrap(), None);
    let unnamed = SseFrame {
        event: None,
        data: "{}".to_owned(),
    };
    assert_eq!(unnamed.into_event().unwrap(), None);
}
