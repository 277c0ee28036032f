use community::{CommunityForum, NewAnswer, NewPost};
use tempfile::TempDir;

fn forum() -> (TempDir, CommunityForum) {
    let dir = tempfile::tempdir().unwrap();
    let forum = CommunityForum::open(&dir.path().join("forum").join("community.db")).unwrap();
    (dir, forum)
}

fn ask(forum: &CommunityForum, author: &str, question: &str) -> i64 {
    forum
        .create_post(NewPost { author: author.into(), question: question.into() })
        .unwrap()
        .id
}

#[test]
fn posts_are_listed_newest_first() {
    let (_dir, forum) = forum();
    ask(&forum, "Ramesh", "When should I sow mustard?");
    ask(&forum, "Sita", "Best fertilizer for paddy?");

    let posts = forum.list_posts().unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].author, "Sita");
    assert_eq!(posts[1].question, "When should I sow mustard?");
    assert!(posts.iter().all(|post| post.answers.is_empty()));
}

#[test]
fn new_answers_go_to_the_front() {
    let (_dir, forum) = forum();
    let id = ask(&forum, "Ramesh", "Yellow leaves on wheat?");

    forum.add_answer(id, NewAnswer { author: "Anil".into(), answer: "Check nitrogen.".into() }).unwrap();
    let post = forum
        .add_answer(id, NewAnswer { author: "Meena".into(), answer: "Could be rust.".into() })
        .unwrap()
        .expect("post exists");

    assert_eq!(post.answers.len(), 2);
    assert_eq!(post.answers[0].author, "Meena");
    assert_eq!(post.answers[1].answer, "Check nitrogen.");
    assert!(post.answers.iter().all(|answer| answer.upvotes == 0));

    let listed = forum.list_posts().unwrap();
    assert_eq!(listed[0].answers, post.answers);
}

#[test]
fn answering_a_missing_post_returns_none() {
    let (_dir, forum) = forum();
    let result = forum.add_answer(42, NewAnswer::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn deleting_a_post_removes_its_answers() {
    let (_dir, forum) = forum();
    let keep = ask(&forum, "Sita", "Drip or sprinkler?");
    let gone = ask(&forum, "Ramesh", "Old question");
    forum.add_answer(gone, NewAnswer { author: "Anil".into(), answer: "Reply".into() }).unwrap();

    assert!(forum.delete_post(gone).unwrap());
    assert!(!forum.delete_post(gone).unwrap());
    assert!(forum.get_post(gone).unwrap().is_none());

    let posts = forum.list_posts().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, keep);
}

#[test]
fn posts_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("community.db");

    let id = ask(&CommunityForum::open(&path).unwrap(), "Ramesh", "Is it going to rain?");
    let reopened = CommunityForum::open(&path).unwrap();

    assert_eq!(reopened.get_post(id).unwrap().unwrap().question, "Is it going to rain?");
}

#[test]
fn posts_serialize_with_nested_answers() {
    let (_dir, forum) = forum();
    let id = ask(&forum, "Ramesh", "Seed rate for gram?");
    let post = forum
        .add_answer(id, NewAnswer { author: "Anil".into(), answer: "30 kg per acre".into() })
        .unwrap()
        .unwrap();

    let value = serde_json::to_value(&post).unwrap();

    assert_eq!(value["question"], "Seed rate for gram?");
    assert_eq!(value["answers"][0]["answer"], "30 kg per acre");
    assert_eq!(value["answers"][0]["upvotes"], 0);
    assert!(value["timestamp"].is_string());
}

#[test]
fn missing_fields_default_to_empty_text() {
    let post: NewPost = serde_json::from_value(serde_json::json!({"question": "Anyone?"})).unwrap();
    assert_eq!(post.author, "");
    assert_eq!(post.question, "Anyone?");
}
