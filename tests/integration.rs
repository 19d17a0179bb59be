//! Integration tests building full models from realistic transcripts.

use std::io::Write;

use chatstat::prelude::*;

/// A realistic Korean export: metadata header, several days, rich content,
/// system notices, multi-line bodies.
const KOREAN_TRANSCRIPT: &str = "\
우리 스터디 님과 카카오톡 대화
저장한 날짜 : 2018-04-30 11:22:33

2018년 4월 22일 일요일
철수, 오후 3:03 : 안녕하세요
영희, 오후 3:04 : 네 안녕하세요
철수, 오후 3:05 : 내일 모임은
오후 두 시에
시작합니다
영희, 오후 3:10 : 사진
철수, 오후 3:11 : https://youtu.be/dQw4w9WgXcQ
2018년 4월 23일 월요일
민수님이 들어왔습니다.
민수, 오전 9:00 : 반갑습니다
영희, 오전 9:01 : 이모티콘
철수, 오전 9:02 : 파일: 발표자료.pdf
민수, 오전 9:30 : 보이스톡 2:05
영희, 오후 1:00 : hey Hey
2018년 4월 25일 수요일
철수, 오후 8:00 : 동영상
영희님이 나갔습니다.";

fn korean_index() -> ChatIndex {
    ChatIndex::from_str(KOREAN_TRANSCRIPT).unwrap()
}

#[test]
fn test_chat_constructor_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KOREAN_TRANSCRIPT.as_bytes()).unwrap();

    let index = chat(file.path()).unwrap();
    assert_eq!(index.buckets().len(), 3);
    assert_eq!(index.meta().title.as_deref(), Some("우리 스터디"));
    assert!(index.meta().date_saved.is_some());
    assert_eq!(index.locale(), Locale::Korean);
}

#[test]
fn test_chat_constructor_missing_file() {
    let err = chat("/no/such/file.txt").unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_bucket_structure() {
    let index = korean_index();
    assert_eq!(
        index.date_keys().collect::<Vec<_>>(),
        vec!["2018-4-22-일", "2018-4-23-월", "2018-4-25-수"]
    );
    // 5 + 6 (incl. join notice) + 2 (incl. leave notice)
    assert_eq!(index.buckets()[0].messages().len(), 5);
    assert_eq!(index.buckets()[1].messages().len(), 6);
    assert_eq!(index.buckets()[2].messages().len(), 2);
    assert_eq!(index.message_count(), 13);
}

#[test]
fn test_multiline_body_joined() {
    let index = korean_index();
    let day = index.date_data("2018-4-22-일").unwrap();
    assert_eq!(day[2].body, "내일 모임은\n오후 두 시에\n시작합니다");
    assert_eq!(day[2].word_count(), 6);
}

#[test]
fn test_count_messages_totals_and_scopes() {
    let index = korean_index();
    // 11 sender-attributable messages; 2 system notices excluded
    assert_eq!(index.count_messages(&SenderFilter::all()), 11);
    assert_eq!(index.count_messages(&SenderFilter::only(["철수"])), 5);
    assert_eq!(index.count_messages(&SenderFilter::only(["영희"])), 4);
    assert_eq!(index.count_messages(&SenderFilter::only(["민수"])), 2);
    assert_eq!(index.count_messages(&SenderFilter::only(["유령"])), 0);

    let sum: usize = index
        .senders()
        .map(|s| index.count_messages(&SenderFilter::only([s])))
        .sum();
    assert_eq!(sum, index.count_messages(&SenderFilter::all()));
}

#[test]
fn test_word_occurrences() {
    let index = korean_index();
    assert_eq!(index.count_word_occurrences(&WordQuery::new(["hey"])), 1);
    assert_eq!(index.count_word_occurrences(&WordQuery::new(["Hey"])), 1);
    assert_eq!(
        index.count_word_occurrences(&WordQuery::new(["hey", "Hey"])),
        2
    );
    assert_eq!(
        index.count_word_occurrences(&WordQuery::new(["안녕하세요"])),
        2
    );
    assert_eq!(
        index.count_word_occurrences(&WordQuery::new(["안녕하세요"]).with_sender("철수")),
        1
    );
}

#[test]
fn test_last_date_and_date_lookup() {
    let index = korean_index();
    assert_eq!(index.last_date().unwrap(), "2018-4-25-수");

    let day = index.date_data("2018-4-23-월").unwrap();
    assert_eq!(day.len(), 6);
    assert_eq!(day[0].kind, MessageKind::System);
    assert_eq!(day[1].sender, "민수");

    let err = index.date_data("2099-1-1-일").unwrap_err();
    assert!(err.is_date_not_found());
    assert!(err.to_string().contains("2099-1-1-일"));
}

#[test]
fn test_rich_content_tally() {
    let index = korean_index();
    let tally = index.tally_rich_content();
    assert_eq!(tally[&MessageKind::Photo], 1);
    assert_eq!(tally[&MessageKind::YoutubeLink], 1);
    assert_eq!(tally[&MessageKind::Sticker], 1);
    assert_eq!(tally[&MessageKind::File], 1);
    assert_eq!(tally[&MessageKind::Call], 1);
    assert_eq!(tally[&MessageKind::Video], 1);
    assert!(!tally.contains_key(&MessageKind::Link));

    // exhaustiveness: rich + text + system == total
    let rich: usize = tally.values().sum();
    let text = index
        .messages()
        .filter(|m| m.kind == MessageKind::Text)
        .count();
    let system = index.messages().filter(|m| m.is_system()).count();
    assert_eq!(rich + text + system, index.message_count());
    assert_eq!(system, 2);
}

#[test]
fn test_call_duration_supplement() {
    let index = korean_index();
    let call = index
        .messages()
        .find(|m| m.kind == MessageKind::Call)
        .unwrap();
    assert_eq!(call.duration, Some(125));
    assert_eq!(call.body, "");
}

#[test]
fn test_top_days() {
    let index = korean_index();
    // sender-attributable: day1 = 5, day2 = 5, day3 = 1 → tie, chronological
    assert_eq!(
        index.top_days_by(DayMetric::MessageCount),
        vec!["2018-4-22-일", "2018-4-23-월"]
    );
    // media: photo day1, file day2, video day3 → three-way tie
    assert_eq!(
        index.top_days_by(DayMetric::MediaCount),
        vec!["2018-4-22-일", "2018-4-23-월", "2018-4-25-수"]
    );
    assert_eq!(
        index.top_days_by(DayMetric::StickerCount),
        vec!["2018-4-23-월"]
    );
}

#[test]
fn test_per_sender_averages() {
    let index = korean_index();
    let averages = index.per_sender_averages();
    assert_eq!(averages.len(), 3);

    // 민수: "반갑습니다" (1 word, 5 letters) + call marker (0 words), one day
    let minsu = &averages["민수"];
    assert!((minsu.words_per_message - 0.5).abs() < 1e-9);
    assert!((minsu.letters_per_message - 2.5).abs() < 1e-9);
    assert!((minsu.messages_per_day - 2.0).abs() < 1e-9);
    assert!((minsu.letters_per_day - 5.0).abs() < 1e-9);

    // 철수 appears on all three days with 5 messages
    let cheolsu = &averages["철수"];
    assert!((cheolsu.messages_per_day - 5.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_span_and_histogram() {
    let index = korean_index();
    // Apr 22 .. Apr 25 inclusive
    assert_eq!(index.span_days(), 4);

    let hours = index.hourly_histogram();
    assert_eq!(hours[15], 5);
    assert_eq!(hours[9], 4);
    assert_eq!(hours[13], 1);
    assert_eq!(hours[20], 1);
    // system notices carry no time
    assert_eq!(hours.iter().sum::<usize>(), 11);

    // Apr 22 2018 was a Sunday, Apr 23 a Monday, Apr 25 a Wednesday
    let days = index.weekday_histogram();
    assert_eq!(days[6], 5);
    assert_eq!(days[0], 5);
    assert_eq!(days[2], 1);
    assert_eq!(days.iter().sum::<usize>(), 11);
}

#[test]
fn test_no_unparsed_lines_in_clean_transcript() {
    let index = korean_index();
    assert!(index.unparsed_lines().is_empty());
}

#[test]
fn test_english_transcript_end_to_end() {
    let transcript = "\
Study Group with KakaoTalk Chats
Date Saved : 2018-04-30 11:22:33

Sunday, April 22, 2018
Alice, 3:03 PM : hello there
Bob, 3:04 PM : Photo
Monday, April 23, 2018
Alice invited Carol.
Carol, 9:00 AM : nice to meet you
Bob, 9:01 AM : Voice Call 1:00:00";

    let index = ChatIndex::from_str(transcript).unwrap();
    assert_eq!(index.locale(), Locale::English);
    assert_eq!(index.meta().title.as_deref(), Some("Study Group"));
    assert_eq!(index.last_date().unwrap(), "2018-4-23-Monday");
    assert_eq!(index.count_messages(&SenderFilter::all()), 4);

    let tally = index.tally_rich_content();
    assert_eq!(tally[&MessageKind::Photo], 1);
    assert_eq!(tally[&MessageKind::Call], 1);

    let call = index
        .messages()
        .find(|m| m.kind == MessageKind::Call)
        .unwrap();
    assert_eq!(call.duration, Some(3600));
}

#[test]
fn test_explicit_locale_config() {
    let index = ChatIndex::from_str_with_config(
        "2018년 4월 23일 월요일\n철수, 오후 3:03 : 안녕",
        ParserConfig::new().with_locale(Locale::Korean),
    )
    .unwrap();
    assert_eq!(index.message_count(), 1);
}

#[test]
fn test_two_models_are_independent() {
    let a = korean_index();
    let b = ChatIndex::from_str("2020년 1월 1일 수요일\n혼자, 오전 10:00 : 새해").unwrap();

    assert_eq!(a.buckets().len(), 3);
    assert_eq!(b.buckets().len(), 1);
    assert_eq!(b.count_messages(&SenderFilter::all()), 1);
    // querying b does not disturb a
    assert_eq!(a.last_date().unwrap(), "2018-4-25-수");
}

#[cfg(feature = "json-output")]
#[test]
fn test_model_serializes_to_json() {
    let index = korean_index();
    let json = serde_json::to_string(index.buckets()).unwrap();
    assert!(json.contains("2018-4-22-일"));
    assert!(json.contains("철수"));

    let averages = serde_json::to_string(&index.per_sender_averages()).unwrap();
    assert!(averages.contains("words_per_message"));
}
